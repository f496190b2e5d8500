mod trace_notes;
mod validate;
