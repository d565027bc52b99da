pub mod geospatial;
pub mod manager;
pub mod matcher;
pub mod name;
pub mod score;
