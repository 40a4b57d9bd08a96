// Pipeline processing: standardization and rule-based validation

pub mod normalize;
pub mod quality_gate;
