mod calculation_result;
mod income_tax_bracket;
mod propulsion;
mod tax_context;
mod vehicle_input;

pub use calculation_result::CalculationResult;
pub use income_tax_bracket::IncomeTaxBracket;
pub use propulsion::Propulsion;
pub use tax_context::UserTaxContext;
pub use vehicle_input::VehicleInput;
