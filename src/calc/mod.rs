pub mod column;
pub mod measure;
pub mod results;
pub mod value;
