//! Deterministic bus-trace fingerprint of both `addi` scenario paths.

use harness_core::{
    addi_fetch_script, addi_harness, BranchPath, HarnessConfig, PortWrite, ScriptedPort,
};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

fn fingerprint(path: BranchPath) -> String {
    let mut harness = addi_harness(HarnessConfig::immediate()).expect("image should fit ROM");
    let mut port = ScriptedPort::from_transactions(addi_fetch_script(path));
    let outcome = harness.run(&mut port).expect("script should reach a sentinel");

    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    for write in port.writes() {
        match *write {
            PortWrite::ClockControl(value) => {
                hash_bytes(&mut hash, &[0x10]);
                hash_bytes(&mut hash, &value.to_le_bytes());
            }
            PortWrite::ResponseData(value) => {
                hash_bytes(&mut hash, &[0x11]);
                hash_bytes(&mut hash, &value.to_le_bytes());
            }
            PortWrite::TransactionEnd(level) => hash_bytes(&mut hash, &[0x12, u8::from(level)]),
            PortWrite::Status { tag, code } => {
                hash_bytes(&mut hash, &[0x13, tag]);
                hash_bytes(&mut hash, &code.to_le_bytes());
            }
        }
    }
    hash_bytes(&mut hash, &harness.stats().cycles.to_le_bytes());

    format!("{outcome}: {hash:016x}")
}

fn main() {
    println!("taken     {}", fingerprint(BranchPath::Taken));
    println!("not-taken {}", fingerprint(BranchPath::NotTaken));
}
