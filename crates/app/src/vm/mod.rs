mod results_vm;
mod round_vm;

pub use results_vm::ResultsVm;
pub use round_vm::RoundVm;
