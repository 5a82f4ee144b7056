pub mod duration;
pub mod textgrid;
