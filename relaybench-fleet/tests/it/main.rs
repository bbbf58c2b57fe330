mod allocation_failure;
mod end_to_end;
