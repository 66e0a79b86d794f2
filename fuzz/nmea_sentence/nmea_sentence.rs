#![no_main]
use libfuzzer_sys::fuzz_target;

use pilothouse::nmea;

fuzz_target!(|input: &[u8]| {
    let _ = nmea::parse("fuzz", input);
});
