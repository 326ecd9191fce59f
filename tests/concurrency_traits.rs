use cachestat::concurrency::{SpinFlag, StripedAccumulator};
use cachestat::{Counter, PaddedI64, Telemetry};

fn assert_send<T: Send>() {}
fn assert_sync<T: Sync>() {}

#[test]
fn counting_types_are_send_and_sync() {
    assert_send::<StripedAccumulator>();
    assert_sync::<StripedAccumulator>();
    assert_send::<Counter>();
    assert_sync::<Counter>();
    assert_send::<PaddedI64>();
    assert_sync::<PaddedI64>();
    assert_sync::<SpinFlag>();
}

#[test]
fn telemetry_can_be_shared_across_threads() {
    assert_send::<Telemetry>();
    assert_sync::<Telemetry>();
}
