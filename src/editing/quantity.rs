/// Unit system a quantity is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasurementSystem {
    #[default]
    Metric,
    Imperial,
    ImperialUs,
    ImperialUk,
}

impl MeasurementSystem {
    pub fn is_metric(self) -> bool {
        self == MeasurementSystem::Metric
    }
}

/// Something that shows and edits one numeric quantity.
///
/// The value is always exchanged in the quantity's base unit; only the
/// presentation depends on the measurement system.
pub trait QuantityEditor {
    fn qty_value(&self) -> f64;
    fn set_qty_value(&mut self, v: f64);

    fn measurement_system(&self) -> MeasurementSystem;

    /// Called when the surrounding context switches unit system.
    fn update_editor(&mut self, _new_system: MeasurementSystem) {}
}

const METERS_PER_INCH: f64 = 0.0254;

/// Length editor holding its value in metres, shown in mm or inches.
#[derive(Debug, Clone, Default)]
pub struct LengthEditor {
    meters: f64,
    system: MeasurementSystem,
}

impl LengthEditor {
    pub fn new(system: MeasurementSystem) -> Self {
        Self { meters: 0.0, system }
    }

    pub fn display_text(&self) -> String {
        if self.system.is_metric() {
            format!("{:.1} mm", self.meters * 1000.0)
        } else {
            format!("{:.2} in", self.meters / METERS_PER_INCH)
        }
    }
}

impl QuantityEditor for LengthEditor {
    fn qty_value(&self) -> f64 {
        self.meters
    }

    fn set_qty_value(&mut self, v: f64) {
        self.meters = v;
    }

    fn measurement_system(&self) -> MeasurementSystem {
        self.system
    }

    fn update_editor(&mut self, new_system: MeasurementSystem) {
        self.system = new_system;
    }
}

#[test]
fn switching_system_keeps_the_value() {
    let mut editor = LengthEditor::new(MeasurementSystem::Metric);
    editor.set_qty_value(0.0254);
    assert_eq!(editor.display_text(), "25.4 mm");

    editor.update_editor(MeasurementSystem::ImperialUs);
    assert_eq!(editor.measurement_system(), MeasurementSystem::ImperialUs);
    assert_eq!(editor.display_text(), "1.00 in");
    assert_eq!(editor.qty_value(), 0.0254);
}

#[test]
fn default_update_is_a_no_op() {
    struct Fixed(f64);

    impl QuantityEditor for Fixed {
        fn qty_value(&self) -> f64 {
            self.0
        }
        fn set_qty_value(&mut self, v: f64) {
            self.0 = v;
        }
        fn measurement_system(&self) -> MeasurementSystem {
            MeasurementSystem::default()
        }
    }

    let mut editor: Box<dyn QuantityEditor> = Box::new(Fixed(2.5));
    editor.update_editor(MeasurementSystem::Imperial);
    assert_eq!(editor.qty_value(), 2.5);
    assert!(editor.measurement_system().is_metric());
}
