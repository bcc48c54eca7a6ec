//! Optimizer hyperparameter targets and their schedules

mod param_groups;
mod scheduler;

pub use param_groups::{ParamGroup, ParamGroups};
pub use scheduler::{
    simulate, ConcatEntry, ConcatScheduler, Constructor, CyclicalConfig, CyclicalScheduler,
    EventDuration, ParamScheduler, ScheduleContext, ScheduleFactory, ScheduleRegistry,
    ScheduleState, Waveform,
};
