//! Fixed per-action audit comment templates.
//!
//! All templates are rendered eagerly, at the point where the
//! pre-mutation field values are still observable.

use bursar_core::models::user::{CreateUser, User};

pub fn user_created(input: &CreateUser) -> String {
    format!(
        "Created user {} {} {} with role {}",
        input.surname, input.name, input.patronymic, input.role
    )
}

pub fn user_edited(user: &User) -> String {
    format!(
        "Edited user {} {} {}",
        user.surname, user.name, user.patronymic
    )
}

pub fn user_deleted(user: &User) -> String {
    format!(
        "Deleted user {} {} {} with role {}",
        user.surname, user.name, user.patronymic, user.role
    )
}

pub fn users_imported(count: usize) -> String {
    format!("Imported {count} users from file")
}

pub fn group_created(name: &str) -> String {
    format!("Created group {name}")
}

pub fn group_renamed(old: &str, new: &str) -> String {
    format!("Renamed group {old} to {new}")
}

pub fn group_deleted(name: &str) -> String {
    format!("Deleted group {name}")
}

pub fn semester_created(name: &str) -> String {
    format!("Created semester {name}")
}

pub fn semester_renamed(old: &str, new: &str) -> String {
    format!("Renamed semester {old} to {new}")
}

pub fn semester_deleted(name: &str) -> String {
    format!("Deleted semester {name}")
}

pub fn student_added_to_group(student: &User, group: &str) -> String {
    format!(
        "Added student {} {} to group {group}",
        student.surname, student.name
    )
}

pub fn student_removed_from_group(student: &User, group: &str) -> String {
    format!(
        "Removed student {} {} from group {group}",
        student.surname, student.name
    )
}

pub fn tuition_payment(semester: &str, amount: f64) -> String {
    format!("Tuition payment for semester {semester} of {amount}")
}
