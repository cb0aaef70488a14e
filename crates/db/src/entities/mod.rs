//! `SeaORM` entity definitions.

pub mod migrations;
