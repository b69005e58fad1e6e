pub mod editor;
pub mod pipeline;
pub mod task_ops;
