mod mnist;

pub use mnist::{default_data_dir, MnistDataset};
