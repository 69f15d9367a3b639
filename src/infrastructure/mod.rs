pub mod email;
pub mod persistence;
pub mod qr_render;
