//! Dataset plumbing around the HOG feature pipeline: dataset lists, image
//! decoding, parallel batch extraction and the sparse feature file consumed
//! by external linear classifiers.

mod dataset;
mod features;

pub use dataset::{Sample, load_file_list, parse_file_list};
pub use features::{LabeledFeatures, extract_batch, extract_sample, load_rgb, write_sparse_features};
