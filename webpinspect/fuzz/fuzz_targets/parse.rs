#![no_main]

use libfuzzer_sys::fuzz_target;
use webpinspect::Config;

fuzz_target!(|data: &[u8]| {
    for pad_odd_chunks in [false, true] {
        let config = Config::builder().pad_odd_chunks(pad_odd_chunks).build();
        #[cfg_attr(not(fuzzing_repro), allow(unused))]
        match webpinspect::parse_with_config(data, &config) {
            Ok(document) => {
                #[cfg(fuzzing_repro)]
                eprintln!("webpinspect returned {} chunks", document.len());

                // Anything decoded must survive a write and re-parse unchanged.
                if !pad_odd_chunks {
                    assert_eq!(webpinspect::parse(&document.to_vec()).ok(), Some(document));
                }
            }
            Err(error) => {
                #[cfg(fuzzing_repro)]
                eprintln!("webpinspect returned a parse error: {error}\n{error:?}");
            }
        }
    }
});
