use lasercut_camtools::GcodeCutter;
use lasercut_core::{LaserJob, NoProgress, PropertyBag, VectorPart};
use lasercut_settings::DriverSettings;

fn cut(power: f64, speed: f64) -> PropertyBag {
    PropertyBag::new().with("power", power).with("speed", speed)
}

fn body(program: &str) -> Vec<&str> {
    program
        .lines()
        .skip_while(|line| *line != "; Vector part")
        .take_while(|line| *line != "; End-Of-File")
        .collect()
}

#[test]
fn test_identical_coordinates_emit_one_motion() {
    let cutter = GcodeCutter::new(DriverSettings::default()).unwrap();
    let mut part = VectorPart::new(cut(80.0, 600.0), 25.4).unwrap();
    part.move_to(5.0, 5.0)
        .move_to(5.0, 5.0)
        .line_to(10.0, 5.0)
        .line_to(10.0, 5.0)
        .move_to(10.0, 5.0)
        .line_to(10.0, 5.0);

    let mut job = LaserJob::new("dupes");
    job.add_part(part);
    let program = cutter.generate(&job, &NoProgress).unwrap();

    let motions: Vec<_> = body(&program)
        .into_iter()
        .filter(|line| line.starts_with('G') || line.starts_with('X') || line.starts_with('Y'))
        .collect();
    assert_eq!(
        motions,
        vec!["G00 X5.0000 Y-5.0000 F3000", "G01 X10.0000 F600"]
    );
}

#[test]
fn test_default_settings_mirror_y() {
    let cutter = GcodeCutter::new(DriverSettings::default()).unwrap();
    let mut part = VectorPart::new(cut(50.0, 1000.0), 254.0).unwrap();
    part.move_to(100.0, 200.0).line_to(300.0, 200.0);

    let mut job = LaserJob::new("mirror");
    job.add_part(part);
    let program = cutter.generate(&job, &NoProgress).unwrap();

    assert!(program.contains("G00 X10.0000 Y-20.0000 F3000\n"));
    assert!(program.contains("M3 S500\nG01 X30.0000 F1000\n"));
}

#[test]
fn test_mirror_x_only() {
    let mut settings = DriverSettings::default();
    settings.machine.mirror_x = true;
    settings.machine.mirror_y = false;
    let cutter = GcodeCutter::new(settings).unwrap();

    let mut part = VectorPart::new(cut(50.0, 1000.0), 25.4).unwrap();
    part.move_to(12.5, 3.0);
    let mut job = LaserJob::new("mirror");
    job.add_part(part);
    let program = cutter.generate(&job, &NoProgress).unwrap();

    assert!(program.contains("G00 X-12.5000 Y3.0000 F3000\n"));
}

#[test]
fn test_three_passes_step_depth_twice() {
    let cutter = GcodeCutter::new(DriverSettings::default()).unwrap();
    let property = cut(100.0, 300.0).with("passes", 3).with("pass depth", 0.5);
    let mut part = VectorPart::new(property, 25.4).unwrap();
    part.move_to(0.0, 0.0).line_to(10.0, 0.0);

    let mut job = LaserJob::new("passes");
    job.add_part(part);
    let program = cutter.generate(&job, &NoProgress).unwrap();

    assert_eq!(program.matches("; Z step 0.5000 mm\nG91 Z0.5000 G90\n").count(), 2);
    assert_eq!(program.matches("G91").count(), 2);

    let pass_one = program.find("; Pass 1 of 3").unwrap();
    let pass_two = program.find("; Pass 2 of 3").unwrap();
    let pass_three = program.find("; Pass 3 of 3").unwrap();
    let first_step = program.find("G91").unwrap();
    let last_step = program.rfind("G91").unwrap();
    assert!(pass_one < pass_two && pass_two < first_step && first_step < pass_three);
    assert!(pass_three < last_step);

    // the laser is off before the work is lowered
    let before_step = &program[..first_step];
    assert!(before_step.trim_end().ends_with("; Z step 0.5000 mm"));
    assert!(before_step.contains("M5\n; Z step"));
}

#[test]
fn test_passes_without_depth_do_not_step() {
    let cutter = GcodeCutter::new(DriverSettings::default()).unwrap();
    let property = cut(100.0, 300.0).with("passes", 2);
    let mut part = VectorPart::new(property, 25.4).unwrap();
    part.move_to(0.0, 0.0).line_to(10.0, 0.0);

    let mut job = LaserJob::new("passes");
    job.add_part(part);
    let program = cutter.generate(&job, &NoProgress).unwrap();

    assert!(program.contains("; Pass 2 of 2"));
    assert!(!program.contains("G91"));
}

#[test]
fn test_property_change_pushes_focus_and_ventilation() {
    let mut settings = DriverSettings::default();
    settings.machine.supports_focus = true;
    settings.machine.supports_ventilation = true;
    settings.machine.mirror_y = false;
    let cutter = GcodeCutter::new(settings).unwrap();

    let mut part = VectorPart::new(cut(40.0, 500.0), 25.4).unwrap();
    part.move_to(0.0, 0.0)
        .line_to(5.0, 0.0)
        .set_property(cut(40.0, 500.0).with("focus", 2.0).with("ventilation", false));

    let mut job = LaserJob::new("focus");
    job.add_part(part);
    let program = cutter.generate(&job, &NoProgress).unwrap();

    let lines = body(&program);
    assert_eq!(
        lines,
        vec![
            "; Vector part",
            "G00 Z0.0000",
            "M106 ; Ventilation On",
            "G00 X0.0000 Y0.0000 F3000",
            "M3 S400",
            "G01 X5.0000 F500",
            "M5",
            "G00 Z2.0000",
            "M107 ; Ventilation Off",
            "M5",
            "G00 Z0.0000",
            "M107 ; Ventilation Off",
            "M2",
        ]
    );
}

#[test]
fn test_focus_change_keeps_pass_depth() {
    let mut settings = DriverSettings::default();
    settings.machine.supports_focus = true;
    settings.machine.mirror_y = false;
    let cutter = GcodeCutter::new(settings).unwrap();

    let property = cut(60.0, 400.0).with("passes", 2).with("pass depth", -0.5);
    let mut part = VectorPart::new(property, 25.4).unwrap();
    part.move_to(0.0, 0.0)
        .line_to(5.0, 0.0)
        .set_property(cut(60.0, 400.0).with("focus", 1.0))
        .line_to(10.0, 0.0);

    let mut job = LaserJob::new("depth");
    job.add_part(part);
    let program = cutter.generate(&job, &NoProgress).unwrap();

    let lines = body(&program);
    let step = lines.iter().position(|l| *l == "G91 Z-0.5000 G90").unwrap();
    assert_eq!(lines[step + 1], "G00 Z-0.5000");

    // the focus change in pass 2 is offset by the step as well
    let second_pass = &lines[step..];
    assert!(second_pass.contains(&"G00 Z0.5000"));
    assert!(!second_pass[..second_pass.len() - 3].contains(&"G00 Z0.0000"));
    assert!(!second_pass[..second_pass.len() - 3].contains(&"G00 Z1.0000"));
}
