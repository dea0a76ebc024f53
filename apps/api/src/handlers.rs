pub mod health;
pub mod invalidations;
pub mod modules;
pub mod records;
