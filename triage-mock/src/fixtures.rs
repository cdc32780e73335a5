//! Canned responses, one per task type.
//!
//! Two fixtures are JSON objects and two are prose, so callers exercise both
//! payload shapes.

use triage_core::TaskType;

const NURSING_ASSESSMENT: &str = r#"{
  "general": "Alert and oriented x3, resting in semi-Fowler's position.",
  "respiratory": "Lungs clear bilaterally, no accessory muscle use.",
  "cardiovascular": "Regular rate and rhythm, peripheral pulses 2+ throughout.",
  "skin": "Warm and dry, no breakdown noted on pressure points.",
  "plan": "Continue q4h vitals and fall precautions."
}"#;

const SOAP_NOTE: &str = r#"{
  "subjective": "Patient reports pain 3/10 at incision site, improved from 6/10.",
  "objective": "T 37.1, HR 78, BP 122/74, RR 16. Incision clean, dry, intact.",
  "assessment": "Post-operative day 2, pain controlled, no signs of infection.",
  "plan": "Continue scheduled analgesia, ambulate twice daily, wound check q shift."
}"#;

const RISK_ASSESSMENT: &str = "Fall risk is moderate: the patient mobilizes with a walker, \
takes one sedating medication at night, and had one near-miss this admission. Medication \
interaction review found no high-severity pairs. Recommend bed alarm at night, scheduled \
toileting, and pharmacist review of the evening sedative dose.";

const DISCHARGE_SUMMARY: &str = "Admitted for community-acquired pneumonia, treated with \
IV then oral antibiotics with steady improvement. Afebrile for 48 hours, ambulating \
independently, oxygen saturation 96% on room air. Discharged home with a 5-day oral \
antibiotic course, follow-up with primary care in one week, and return precautions \
reviewed with the patient and family.";

pub(crate) const fn text_for(task: TaskType) -> &'static str {
    match task {
        TaskType::NursingAssessment => NURSING_ASSESSMENT,
        TaskType::SoapNote => SOAP_NOTE,
        TaskType::RiskAssessment => RISK_ASSESSMENT,
        TaskType::DischargeSummary => DISCHARGE_SUMMARY,
    }
}
