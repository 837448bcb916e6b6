pub mod folders;
pub mod template;
