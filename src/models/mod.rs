pub mod pagination;
pub mod task;
pub mod user;

pub use pagination::{Cursor, Page, PageInfo, PageRequest, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use task::{DeleteTasksRequest, DeleteTasksResponse, DeletedTask, NewTaskRequest, Task, UpdateTaskRequest};
pub use user::{UpdateUserRequest, User};
