//! Backend behaviour seen through the protocol driver
//!
//! Runs the same frames through boxed, recorded and failing devices and
//! checks the driver treats them uniformly.

use tt_mnist_driver::pins::{InputPins, StatusWord, PIXEL_COUNT};
use tt_mnist_driver::{
    DeviceKind, DriverError, FaultMode, PinDevice, ProtocolDriver, RecordingDevice,
    SoftwareDevice, TemplateClassifier,
};

/// Device whose clock fails after a fixed number of edges
#[derive(Debug)]
struct FailingDevice {
    remaining: u32,
}

impl PinDevice for FailingDevice {
    fn drive(&mut self, _pins: InputPins) -> tt_mnist_driver::Result<()> {
        Ok(())
    }

    fn tick(&mut self) -> tt_mnist_driver::Result<()> {
        if self.remaining == 0 {
            return Err(DriverError::device("clock stopped"));
        }
        self.remaining -= 1;
        Ok(())
    }

    fn sample(&mut self) -> tt_mnist_driver::Result<u8> {
        Ok(0)
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::External
    }
}

/// Device that decodes its own status instead of going through `sample`
#[derive(Debug)]
struct DecodingDevice;

impl PinDevice for DecodingDevice {
    fn drive(&mut self, _pins: InputPins) -> tt_mnist_driver::Result<()> {
        Ok(())
    }

    fn tick(&mut self) -> tt_mnist_driver::Result<()> {
        Ok(())
    }

    fn sample(&mut self) -> tt_mnist_driver::Result<u8> {
        Ok(0)
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::External
    }

    fn status(&mut self) -> tt_mnist_driver::Result<StatusWord> {
        Ok(StatusWord::compose(5, true, false))
    }
}

#[test]
fn boxed_device_keeps_its_status_decoder() {
    let device: Box<dyn PinDevice> = Box::new(DecodingDevice);
    let mut driver = ProtocolDriver::new(device);

    let outcome = driver.classify(&[0u8; 64]).unwrap();
    assert_eq!(outcome.prediction(), Some(5));
    assert_eq!(outcome.cycles(), 17);
}

#[test]
fn glyph_frames_classify_as_their_digit() {
    let classifier = TemplateClassifier::glyphs();
    let mut driver = ProtocolDriver::new(
        SoftwareDevice::with_classifier(classifier.clone()).with_compute_latency(100),
    );

    for digit in 0..10u8 {
        let frame = *classifier.template(digit).expect("glyph");
        let outcome = driver.classify(&frame).unwrap();
        assert_eq!(outcome.prediction(), Some(digit), "digit {digit}");
    }
    assert_eq!(driver.device().classifications(), 10);
}

#[test]
fn fitted_templates_follow_training_frames() {
    // Class 4 trained on a solid frame: a solid frame now reads as 4
    let solid = [3u8; PIXEL_COUNT];
    let fitted = TemplateClassifier::fit([(&solid, 4u8)]);
    assert_eq!(fitted.template(4), Some(&solid));

    let mut driver = ProtocolDriver::new(SoftwareDevice::with_classifier(fitted));
    assert_eq!(driver.classify(&solid).unwrap().prediction(), Some(4));
}

#[test]
fn forced_prediction_overrides_the_model() {
    let device = SoftwareDevice::with_classifier(|_: &[u8; 64]| 1)
        .with_compute_latency(8)
        .with_fault(FaultMode::ForcePrediction(7));
    let mut driver = ProtocolDriver::new(device);

    let outcome = driver.classify(&[0u8; 64]).unwrap();
    assert_eq!(outcome.prediction(), Some(7));
    assert_eq!(outcome.cycles(), 25);
}

#[test]
fn boxed_device_behaves_like_the_concrete_one() {
    let frame: [u8; 64] = std::array::from_fn(|i| (i % 4) as u8);

    let mut concrete = ProtocolDriver::new(SoftwareDevice::default());
    let boxed_device: Box<dyn PinDevice> = Box::new(SoftwareDevice::default());
    let mut boxed = ProtocolDriver::new(boxed_device);

    assert_eq!(concrete.run(&frame).unwrap(), boxed.run(&frame).unwrap());
    assert_eq!(boxed.device().kind(), DeviceKind::Software);
}

#[test]
fn recorder_reports_inner_kind_and_does_not_change_results() {
    let frame = [2u8; 64];
    let mut plain = ProtocolDriver::new(SoftwareDevice::default());
    let mut recorded = ProtocolDriver::new(RecordingDevice::new(SoftwareDevice::default()));

    assert_eq!(plain.run(&frame).unwrap(), recorded.run(&frame).unwrap());
    assert_eq!(recorded.device().kind(), DeviceKind::Recorded("Software"));
    assert_eq!(recorded.device().kind().to_string(), "Recorded(Software)");
}

#[test]
fn device_errors_abort_the_run() {
    let mut driver = ProtocolDriver::new(FailingDevice { remaining: 10 });
    let err = driver.run(&[0u8; 64]).unwrap_err();
    assert!(matches!(err, DriverError::Device { .. }));
    assert!(err.to_string().contains("clock stopped"));
    assert_eq!(driver.runs(), 0);
}
