/// Randomized instance generation by incremental fence embedding
pub mod generation;
/// Bitset over (connector, direction) slots
pub mod slots;
/// Solver output model and parsing
pub mod solution;
/// Solution validation and rejection reasons
pub mod validation;
