pub mod grid_viewmodel;
pub mod cascade_viewmodel;
pub mod schedule_viewmodel;
pub mod offering_viewmodel;

pub use grid_viewmodel::GridViewModel;
pub use cascade_viewmodel::CascadeViewModel;
pub use schedule_viewmodel::{ProgramScheduleViewModel, TeacherScheduleViewModel};
pub use offering_viewmodel::OfferingViewModel;
