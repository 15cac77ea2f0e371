// Copyright (c) the RustedCalcLab authors
//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod Utils;
pub mod calculator;
pub mod numerical;
pub mod plotting;
pub mod symbolic;
