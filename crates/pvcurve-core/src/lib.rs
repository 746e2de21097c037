//! Photovoltaic IV-curve analysis: unit normalization, curve interpolation, extraction of
//! Jsc/Voc/FF/PCE and series/shunt resistance estimation.

pub mod common;
pub mod domain;
pub mod modules;
pub mod numerics;
