mod controls;
mod details;
mod panels;

pub(in crate::app) use controls::FilterChoices;
pub(in crate::app) use details::DrillDown;
