//! Input/Output: model text loading and writing, and sparse row reading.

pub mod model_file;
pub mod svm;

pub use model_file::{
    load, load_path, load_str, parse_node_line, save_path, write_forest, ForestLoader,
    RawBranchRecord, RawNodeRecord,
};
pub use svm::{parse_svm_line, SvmReader, SvmRow};
