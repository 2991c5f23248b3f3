pub mod assemble;
pub mod common;
pub mod cytoscape;
pub mod error;
pub mod export;
pub mod generate_commands;
pub mod kegg;
pub mod layers;
pub mod midpoint;
pub mod pipeline;
pub mod plan;
pub mod stack;
pub mod table;
