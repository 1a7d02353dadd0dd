#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use mw_reflect as reflect;
pub use mw_utils as utils;
pub use mw_wire as wire;
