#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[macro_use]
extern crate num_derive;

pub mod bootenv;
pub mod nv;
pub mod xdr;
