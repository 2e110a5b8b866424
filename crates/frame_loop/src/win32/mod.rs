pub mod create_window;
pub mod window_class;
pub mod window_class_id;
pub mod window_host;
