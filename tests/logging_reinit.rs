use serial_test::serial;

#[test]
#[serial]
fn init_twice_does_not_panic() {
    screen_magnifier::logging::init(false, None);
    screen_magnifier::logging::init(true, None);
    tracing::debug!("still alive");
}
