/// A single sample of a data quality bit-mask series
pub type MaskWord = u32;
/// Number of flags a single mask word can hold
pub const MASK_WIDTH: usize = MaskWord::BITS as usize;

/// Data quality masks are sampled once per second
pub const MASK_SAMPLE_RATE: u32 = 1;
/// Strain sample rate of the standard open-data release
pub const DEFAULT_STRAIN_RATE: u32 = 4096;

/// Unix time of the GPS epoch, 1980-01-06T00:00:00 UTC
pub const GPS_EPOCH_UNIX: i64 = 315_964_800;

/// GPS times at which each leap second since the GPS epoch took effect.
/// The offset between GPS and UTC is the number of entries at or before a given GPS time.
pub const LEAP_SECONDS_GPS: [i64; 18] = [
    46_828_800,    // 1981-07-01
    78_364_801,    // 1982-07-01
    109_900_802,   // 1983-07-01
    173_059_203,   // 1985-07-01
    252_028_804,   // 1988-01-01
    315_187_205,   // 1990-01-01
    346_723_206,   // 1991-01-01
    393_984_007,   // 1992-07-01
    425_520_008,   // 1993-07-01
    457_056_009,   // 1994-07-01
    504_489_610,   // 1996-01-01
    551_750_411,   // 1997-07-01
    599_184_012,   // 1999-01-01
    820_108_813,   // 2006-01-01
    914_803_214,   // 2009-01-01
    1_025_136_015, // 2012-07-01
    1_119_744_016, // 2015-07-01
    1_167_264_017, // 2017-01-01
];

// Open-data HDF5 layout
pub const META_GPS_START: &str = "meta/GPSstart";
pub const META_DURATION: &str = "meta/Duration";
pub const META_DETECTOR: &str = "meta/Detector";
pub const DQ_MASK: &str = "quality/simple/DQmask";
pub const DQ_NAMES: &str = "quality/simple/DQShortnames";
pub const DQ_DESCRIPTIONS: &str = "quality/simple/DQDescriptions";
pub const INJ_GROUP: &str = "quality/injections";
pub const INJ_MASK: &str = "quality/injections/Injmask";
pub const INJ_NAMES: &str = "quality/injections/InjShortnames";
pub const INJ_DESCRIPTIONS: &str = "quality/injections/InjDescriptions";
pub const STRAIN: &str = "strain/Strain";
pub const STRAIN_SPACING_ATTR: &str = "Xspacing";
