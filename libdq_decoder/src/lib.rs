//! # dq_decoder
//!
//! dq_decoder locates, decodes, and interprets the data quality (DQ) metadata embedded in
//! gravitational-wave open-data HDF5 files. Each file carries a per-second bit-mask where
//! every bit is a named quality flag. dq_decoder turns that mask into boolean channels by
//! name, combines any subset of flags into a single "good data" channel, and extracts the
//! contiguous good-time segments, which can then be used to slice the 4096 Hz strain.
//!
//! ## Installation
//!
//! The only method of install is from source, which is laid out below.
//!
//! ### Rust
//!
//! If you have not used Rust before, you will most likely need to install the Rust tool
//! chain. See the [Rust docs](https://www.rust-lang.org/tools/install) for installation
//! instructions.
//!
//! ### HDF5
//!
//! Before building and running dq_decoder, HDF5 must be installed. Typically this will
//! be installed using a package manager (homebrew, apt, etc), and the Rust libraries will
//! auto detect the location of the HDF install. If a custom install is needed, write the
//! following snippet into the file `.cargo/config.toml` in the repository:
//!
//! ```toml
//! [env]
//! HDF5_DIR="/path/to/my/hdf5/install/"
//!
//! [build]
//! rustflags="-C link-args=-Wl,-rpath,/path/to/my/hdf5/install/lib"
//! ```
//!
//! ### Building & Install
//!
//! To build and install the CLI use `cargo install --path ./dq_decoder_cli` from the top
//! level repository.
//!
//! ## Configuration
//!
//! The YAML format of a configuration file is as follows:
//!
//! ```yml
//! input_files: []
//! report_path: None
//! flags:
//! - DATA
//! injection_flags: []
//! strain_rate: null
//! gate_strain: false
//! ```
//!
//! - `input_files`: the HDF5 files to decode. Each file is decoded on its own.
//! - `report_path`: directory to which the YAML reports are written
//! - `flags`: names of the DQ flags which must all be good. Must not be empty.
//! - `injection_flags`: names of the injection flags which must also be good (optional)
//! - `strain_rate`: strain samples per second. If `null`, it is read from the file.
//! - `gate_strain`: if true, read the strain and slice it with the good segments
//!
//! ## Input
//!
//! The layout read from the HDF5 files is:
//!
//! ```text
//! meta - GPSstart, Duration, Detector
//! quality
//! |---- simple - DQmask, DQShortnames, DQDescriptions
//! |---- injections - Injmask, InjShortnames, InjDescriptions
//! strain
//! |---- Strain(dset) - Xspacing
//! ```
//!
//! Bit `b` of the mask at sample `i` is the state of flag `b` of the catalog for GPS
//! seconds `[GPSstart + i, GPSstart + i + 1)`. A set bit means the flag is good.
//!
//! ## Output
//!
//! One `<file stem>_dq.yml` report per input containing the good segments as half-open
//! `[start, end)` GPS intervals, the matching strain sample ranges, and the fraction of
//! time each flag was good.
pub mod catalog;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod hdf_reader;
pub mod process;
pub mod segment;
pub mod time_base;
