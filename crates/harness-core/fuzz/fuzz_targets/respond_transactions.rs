#![no_main]

use harness_core::{
    Harness, HarnessConfig, HarnessState, ScriptedPort, SidebandInputs, StepOutcome,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut harness = Harness::new(HarnessConfig::immediate());
    let mut port = ScriptedPort::new();

    let mut words = data
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    let preload: Vec<u32> = words.by_ref().take(8).collect();
    let _ = harness.load_rom(0, &preload);
    let _ = harness.load_ram(0, &preload);

    let remaining: Vec<u32> = words.collect();
    for triple in remaining.chunks_exact(3) {
        port.push_inputs(SidebandInputs {
            address: triple[0],
            write_data: triple[1],
            control: triple[2],
        });
    }

    while port.remaining() > 0 {
        match harness.step(&mut port) {
            Ok(StepOutcome::Terminated(outcome)) => {
                assert_eq!(harness.state(), HarnessState::from(outcome));
                break;
            }
            Ok(_) => {}
            Err(err) => panic!("scripted step failed: {err}"),
        }
    }
});
