//! Survey-side inputs of the access policy: stage markers, worker class and
//! response lookups.

mod responses;
mod stage;
mod worker;

pub use responses::{
    find_response_for_person, first_survey, has_response, responses_for_survey, SurveyRecords,
};
pub use stage::SurveyStage;
pub use worker::{BlueCollarRule, WorkerClass};
