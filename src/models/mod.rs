pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskInput, TaskUpdate};
pub use user::{Credentials, User};
