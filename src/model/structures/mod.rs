pub mod match_record;
pub mod player;
pub mod pp_batch;
pub mod pp_trigger;
pub mod rating_adjustment;
pub mod rating_adjustment_type;
