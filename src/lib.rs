//! SimSoviet - planned-economy and governance simulation for a Soviet settlement

pub mod city;
pub mod core;
pub mod economy;
pub mod events;
pub mod political;
pub mod population;
pub mod scoring;
pub mod settlement;
pub mod simulation;
pub mod workforce;
