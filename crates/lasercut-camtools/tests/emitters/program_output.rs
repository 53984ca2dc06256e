use lasercut_camtools::{EmitterError, GcodeCutter};
use lasercut_core::{
    LaserJob, NoProgress, Point, ProgressListener, PropertyBag, Raster3dPart, RasterPart,
    VectorPart,
};
use lasercut_settings::DriverSettings;
use std::cell::RefCell;

#[derive(Default)]
struct Recorder {
    progress: RefCell<Vec<u8>>,
    tasks: RefCell<Vec<String>>,
}

impl ProgressListener for Recorder {
    fn progress_changed(&self, percent: u8) {
        self.progress.borrow_mut().push(percent);
    }

    fn task_changed(&self, label: &str) {
        self.tasks.borrow_mut().push(label.to_string());
    }
}

fn cut() -> PropertyBag {
    PropertyBag::new().with("power", 50.0).with("speed", 800.0)
}

#[test]
fn test_empty_job_still_frames_program() {
    let cutter = GcodeCutter::new(DriverSettings::default()).unwrap();
    let program = cutter.generate(&LaserJob::new("empty"), &NoProgress).unwrap();
    let lines: Vec<&str> = program.lines().collect();

    assert_eq!(lines[0], "; LaserCut - Generated G-code program");
    assert_eq!(lines[1], "; FILE: empty");
    assert!(lines[2].starts_with("; DATE: "));
    assert_eq!(
        &lines[3..],
        &[
            ";",
            ";",
            "G90 ; Absolute distance",
            "G21 ; Units in mm",
            "M5",
            "M5",
            "M2",
            "; End-Of-File",
        ]
    );
    assert!(program.ends_with("; End-Of-File\n"));
}

#[test]
fn test_footer_forces_focus_and_ventilation_when_supported() {
    let mut settings = DriverSettings::default();
    settings.machine.supports_focus = true;
    settings.machine.supports_ventilation = true;
    settings.gcode.footer = "M5\\nM2".to_string();
    let cutter = GcodeCutter::new(settings).unwrap();

    let program = cutter.generate(&LaserJob::new("empty"), &NoProgress).unwrap();
    assert!(program.ends_with("M5\nG00 Z0.0000\nM107 ; Ventilation Off\nM5\nM2\n; End-Of-File\n"));
}

#[test]
fn test_property_error_produces_no_output() {
    let cutter = GcodeCutter::new(DriverSettings::default()).unwrap();
    let mut good = VectorPart::new(cut(), 500.0).unwrap();
    good.move_to(0.0, 0.0).line_to(10.0, 10.0);
    let mut bad = VectorPart::new(cut(), 500.0).unwrap();
    bad.move_to(0.0, 0.0)
        .set_property(PropertyBag::new().with("speed", 100.0));

    let mut job = LaserJob::new("broken");
    job.add_part(good);
    job.add_part(bad);

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("broken.nc");
    let err = cutter.save_job(&job, &NoProgress, &output).unwrap_err();
    assert!(matches!(err, EmitterError::IncompatibleProperty { ref field, .. } if field == "power"));
    assert!(!output.exists());
}

#[test]
fn test_raster_part_property_error() {
    let cutter = GcodeCutter::new(DriverSettings::default()).unwrap();
    let property = PropertyBag::new().with("power", "full").with("speed", 100.0);
    let part = RasterPart::new(Point::default(), 1, 1, vec![vec![true]], property, 300.0).unwrap();
    let mut job = LaserJob::new("broken");
    job.add_part(part);

    assert!(matches!(
        cutter.generate(&job, &NoProgress),
        Err(EmitterError::IncompatibleProperty { .. })
    ));
}

#[test]
fn test_malformed_raster_aborts_job() {
    let cutter = GcodeCutter::new(DriverSettings::default()).unwrap();
    let rows = vec![vec![10u8, 20, 30], vec![10, 20, 30, 40]];
    let part = Raster3dPart::new(Point::default(), 3, 2, rows, cut(), 300.0).unwrap();
    let mut job = LaserJob::new("broken");
    job.add_part(part);

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("broken.nc");
    let err = cutter.save_job(&job, &NoProgress, &output).unwrap_err();
    assert!(matches!(
        err,
        EmitterError::MalformedRasterGeometry {
            line: 1,
            expected: 3,
            actual: 4
        }
    ));
    assert!(!output.exists());
}

#[test]
fn test_progress_milestones() {
    let cutter = GcodeCutter::new(DriverSettings::default()).unwrap();
    let mut job = LaserJob::new("progress");
    for _ in 0..3 {
        let mut part = VectorPart::new(cut(), 500.0).unwrap();
        part.move_to(0.0, 0.0).line_to(50.0, 0.0);
        job.add_part(part);
    }

    let recorder = Recorder::default();
    cutter.generate(&job, &recorder).unwrap();

    assert_eq!(*recorder.progress.borrow(), vec![0, 20, 40, 60, 80, 100]);
    assert_eq!(
        *recorder.tasks.borrow(),
        vec!["Checking job", "Buffering", "Finished"]
    );
}

#[test]
fn test_save_job_writes_program_and_reports_file() {
    let cutter = GcodeCutter::new(DriverSettings::default()).unwrap();
    let mut part = VectorPart::new(cut(), 500.0).unwrap();
    part.move_to(0.0, 0.0).line_to(50.0, 0.0);
    let mut job = LaserJob::new("saved");
    job.add_part(part);

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("saved.nc");
    let recorder = Recorder::default();
    cutter.save_job(&job, &recorder, &output).unwrap();

    let program = std::fs::read_to_string(&output).unwrap();
    assert!(program.starts_with("; LaserCut - Generated G-code program\n; FILE: saved\n"));
    assert!(program.contains("; Vector part\n"));
    assert!(program.ends_with("M2\n; End-Of-File\n"));

    assert_eq!(*recorder.progress.borrow(), vec![0, 20, 80, 100]);
    assert_eq!(
        *recorder.tasks.borrow(),
        vec![
            "Checking job".to_string(),
            "Buffering".to_string(),
            format!("File writing {}", output.display()),
            "Finished".to_string(),
        ]
    );
}

#[test]
fn test_parts_emitted_in_job_order() {
    let cutter = GcodeCutter::new(DriverSettings::default()).unwrap();
    let mut job = LaserJob::new("mixed");
    job.add_part(
        Raster3dPart::new(Point::default(), 1, 1, vec![vec![255]], cut(), 300.0).unwrap(),
    );
    let mut vector = VectorPart::new(cut(), 300.0).unwrap();
    vector.move_to(0.0, 0.0).line_to(30.0, 0.0);
    job.add_part(vector);
    job.add_part(RasterPart::new(Point::default(), 1, 1, vec![vec![true]], cut(), 300.0).unwrap());

    let program = cutter.generate(&job, &NoProgress).unwrap();
    let raster3d = program.find("; Raster 3D part").unwrap();
    let vector = program.find("; Vector part").unwrap();
    let raster = program.find("; Raster part").unwrap();
    assert!(raster3d < vector && vector < raster);
}

#[test]
fn test_non_ascii_title_is_replaced() {
    let cutter = GcodeCutter::new(DriverSettings::default()).unwrap();
    let program = cutter.generate(&LaserJob::new("Schild für Café"), &NoProgress).unwrap();

    assert!(program.is_ascii());
    assert!(program.contains("; FILE: Schild f?r Caf?\n"));
}

#[test]
fn test_save_job_surfaces_io_errors() {
    let cutter = GcodeCutter::new(DriverSettings::default()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing").join("io.nc");

    let recorder = Recorder::default();
    let err = cutter
        .save_job(&LaserJob::new("io"), &recorder, &output)
        .unwrap_err();
    match err {
        EmitterError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!recorder.tasks.borrow().contains(&"Finished".to_string()));
    assert!(!recorder.progress.borrow().contains(&100));
}
