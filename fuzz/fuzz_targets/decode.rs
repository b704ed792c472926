#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // decoding arbitrary bytes may fail, but it must never panic
    let _ = lz4_thaw::decompress_frame(data);
});
