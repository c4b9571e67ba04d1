// src/schema.rs
//! Field descriptor tables. Validation, coverage statistics and the section
//! classifier walk these tables instead of looking fields up by name at runtime.

use crate::models::Program;

/// A named, read-only view of one record field.
pub struct FieldDescriptor {
    pub name: &'static str,
    /// True when the field holds a non-empty, non-zero value.
    pub is_present: fn(&Program) -> bool,
}

/// A long-form content field filled from a document section, with the heading
/// keywords that select it.
pub struct ContentSlot {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub slot: fn(&mut Program) -> &mut String,
}

pub static REQUIRED_FIELDS: [FieldDescriptor; 6] = [
    FieldDescriptor { name: "name", is_present: |p| !p.name.is_empty() },
    FieldDescriptor { name: "faculty", is_present: |p| !p.faculty.is_empty() },
    FieldDescriptor { name: "url", is_present: |p| !p.url.is_empty() },
    FieldDescriptor { name: "duration", is_present: |p| !p.duration.is_empty() },
    FieldDescriptor { name: "form", is_present: |p| p.form.is_some() },
    FieldDescriptor { name: "language", is_present: |p| p.language.is_some() },
];

pub static IMPORTANT_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor { name: "budget_places", is_present: |p| has_count(p.budget_places) },
    FieldDescriptor { name: "exams", is_present: |p| !p.exams.is_empty() },
    FieldDescriptor { name: "description", is_present: |p| !p.description.is_empty() },
];

/// Fields reported in the manifest's coverage table, in report order.
pub static COVERAGE_FIELDS: [FieldDescriptor; 12] = [
    FieldDescriptor { name: "budget_places", is_present: |p| has_count(p.budget_places) },
    FieldDescriptor { name: "paid_places", is_present: |p| has_count(p.paid_places) },
    FieldDescriptor { name: "duration", is_present: |p| !p.duration.is_empty() },
    FieldDescriptor { name: "form", is_present: |p| p.form.is_some() },
    FieldDescriptor { name: "language", is_present: |p| p.language.is_some() },
    FieldDescriptor { name: "exams", is_present: |p| !p.exams.is_empty() },
    FieldDescriptor { name: "description", is_present: |p| !p.description.is_empty() },
    FieldDescriptor { name: "what_to_study", is_present: |p| !p.what_to_study.is_empty() },
    FieldDescriptor { name: "advantages", is_present: |p| !p.advantages.is_empty() },
    FieldDescriptor { name: "career", is_present: |p| !p.career.is_empty() },
    FieldDescriptor { name: "admission_info", is_present: |p| !p.admission_info.is_empty() },
    FieldDescriptor { name: "specializations", is_present: |p| !p.specializations.is_empty() },
];

/// Section lexicons, tested in this order against each heading.
pub static SECTION_SLOTS: [ContentSlot; 4] = [
    ContentSlot {
        name: "what_to_study",
        keywords: &[
            "что я буду изучать",
            "изучать",
            "о программе",
            "кого и зачем",
            "во время обучения",
            "процесс обучения",
            "учебный план",
        ],
        slot: |p| &mut p.what_to_study,
    },
    ContentSlot {
        name: "advantages",
        keywords: &["преимущества", "особенности", "почему стоит"],
        slot: |p| &mut p.advantages,
    },
    ContentSlot {
        name: "career",
        keywords: &["перспективы", "карьер", "после обучения", "трудоустройство"],
        slot: |p| &mut p.career,
    },
    ContentSlot {
        name: "admission_info",
        keywords: &["поступлен", "нужно знать", "как поступить", "вступительн", "егэ"],
        slot: |p| &mut p.admission_info,
    },
];

// Zero places counts as absent.
fn has_count(value: Option<u32>) -> bool {
    matches!(value, Some(n) if n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudyForm;

    #[test]
    fn test_presence_checks() {
        let mut program = Program::default();
        assert!(REQUIRED_FIELDS.iter().all(|f| !(f.is_present)(&program)));
        assert!(IMPORTANT_FIELDS.iter().all(|f| !(f.is_present)(&program)));

        program.form = Some(StudyForm::FullTime);
        program.budget_places = Some(0);
        let form = REQUIRED_FIELDS.iter().find(|f| f.name == "form").unwrap();
        let budget = IMPORTANT_FIELDS.iter().find(|f| f.name == "budget_places").unwrap();
        assert!((form.is_present)(&program));
        assert!(!(budget.is_present)(&program), "zero places should count as missing");

        program.budget_places = Some(10);
        assert!((budget.is_present)(&program));
    }

    #[test]
    fn test_content_slots_write_their_own_field() {
        let mut program = Program::default();
        for slot in &SECTION_SLOTS {
            *(slot.slot)(&mut program) = slot.name.to_string();
        }
        assert_eq!(program.what_to_study, "what_to_study");
        assert_eq!(program.advantages, "advantages");
        assert_eq!(program.career, "career");
        assert_eq!(program.admission_info, "admission_info");
    }
}
