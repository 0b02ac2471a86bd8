pub mod alpha_compositor;
pub mod http_frame_image_source;
