mod degree_fahrenheit;

pub use degree_fahrenheit::DegreeFahrenheit;
