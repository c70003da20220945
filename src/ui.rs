//! Interfaces to the page-side collaborators of an export run.

use std::fmt;

/// User-facing outcomes of an export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    WeeksNotLoaded,
    CredentialsMissing,
    NothingToExport,
    ExportFailed,
    Exported { events: usize },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::WeeksNotLoaded => write!(
                f,
                "Week data has not been loaded yet. Open the timetable page and try again."
            ),
            Notice::CredentialsMissing => write!(
                f,
                "Login credentials have not been captured yet. Reload the timetable page and try again."
            ),
            Notice::NothingToExport => write!(f, "There are no classes to export."),
            Notice::ExportFailed => write!(f, "Exporting the timetable failed."),
            Notice::Exported { events } => write!(f, "Exported {} classes.", events),
        }
    }
}

pub trait Notifier {
    fn notify(&self, notice: Notice);
}

pub trait FileSaver {
    fn save(&self, file_name: &str, mime: &str, contents: &str) -> anyhow::Result<()>;
}

/// The control that starts an export.
pub trait TriggerControl {
    /// Busy means disabled and showing a "working" label.
    fn set_busy(&self, busy: bool);
}

/// Holds the control busy until dropped.
pub struct BusyGuard<'a, C: TriggerControl + ?Sized> {
    control: &'a C,
}

impl<'a, C: TriggerControl + ?Sized> BusyGuard<'a, C> {
    pub fn engage(control: &'a C) -> Self {
        control.set_busy(true);
        Self { control }
    }
}

impl<C: TriggerControl + ?Sized> Drop for BusyGuard<'_, C> {
    fn drop(&mut self) {
        self.control.set_busy(false);
    }
}
