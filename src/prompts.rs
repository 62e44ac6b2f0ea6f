use crate::types::suggestions::SuggestMaterialsRequest;

pub struct Prompts;

impl Prompts {
    pub const SUGGEST_MATERIALS_SYSTEM: &'static str = "You are an AI assistant designed to suggest relevant learning materials for both students and tutors after a tutoring session, based on the session feedback. Analyze the session feedback, the student's level, the tutor's experience and the module to recommend appropriate learning materials for both the student and the tutor. If the session feedback does not contain enough information or it is not appropriate to give a suggestion, return empty lists instead of inventing content. Respond with a single JSON object containing exactly three fields: \"studentMaterials\" (a list of learning materials suitable for the student), \"tutorMaterials\" (a list of learning materials suitable for the tutor to improve their tutoring skills) and \"explanation\" (a brief explanation of why the materials are recommended based on the session feedback).";

    pub fn suggest_materials(input: &SuggestMaterialsRequest) -> String {
        format!(
            "Session Feedback: {}\nStudent Level: {}\nTutor Experience: {}\nModule: {}\n\nBased on the above information, provide the learning materials.",
            input.session_feedback, input.student_level, input.tutor_experience, input.module
        )
    }
}
