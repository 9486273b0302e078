use crate::model::ClusterId;

/// Descriptive learner profile shown after a question ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    pub title: &'static str,
    pub description: &'static str,
    pub encouragement: &'static str,
}

const ANALYTICAL_THINKER: Persona = Persona {
    title: "Analytical Thinker",
    description: "Your data suggests: moderate speed and retries, but the highest backspace rate.",
    encouragement: "You are an excellent Analytical Thinker! A high backspace rate shows you \
        actively self-correct and fine-tune your input. This meticulous, detail-oriented approach \
        ensures your code structure is rigorous. Maintaining this analytical habit will allow you \
        to excel in complex SQL scenarios!",
};

const CAREFUL_REFINER: Persona = Persona {
    title: "Careful Refiner",
    description: "Your data suggests: moderate typing speed, longest key dwell time, and the \
        highest number of retries.",
    encouragement: "You invest focused thought into every key press; you are a very Careful \
        Refiner! Long dwell times and high retries suggest you strive for perfection in every \
        detail. This dedication to quality is an essential trait for becoming an expert. Applaud \
        your focus and hard work!",
};

const HESITANT_EXPLORER: Persona = Persona {
    title: "Hesitant Explorer",
    description: "Your data suggests: slow typing speed, long key-flight time, high deletion \
        rate, and high number of retries.",
    encouragement: "Every step you take is well-thought-out, showing your focus on accuracy! \
        High deletion and pause rates reflect your exploration and optimization of solutions. \
        Remember, every revision deepens your knowledge, and this careful exploratory spirit \
        leads to a more solid understanding.",
};

const PROFICIENT_LEARNER: Persona = Persona {
    title: "Proficient Learner",
    description: "Your data suggests: very fast typing speed, minimal key-flight time, and the \
        fewest retries.",
    encouragement: "Excellent! Your learning efficiency is impressive. Keep up this fast and \
        precise pace; you are efficiently building a strong skill foundation!",
};

const FAST_IMPROVISER: Persona = Persona {
    title: "Fast Improviser",
    description: "Your data suggests: above-average typing speed, shortest key dwell time, but \
        a high number of retries.",
    encouragement: "Your learning style is 'Act Fast, Improve Faster'! You are bold in trying \
        and quick to iterate, showing strong adaptability and motivation. Speed and high action \
        capability are your strengths; combining them with rapid practice will accelerate your \
        SQL skills!",
};

const DEFAULT_PERSONA: Persona = Persona {
    title: "General Learner",
    description: "Insufficient data from this question, or no clear learner profile has been \
        formed yet.",
    encouragement: "Keep going! Every attempt is a cornerstone of progress. We look forward to \
        your next question to continue exploring and learning SQL!",
};

/// Map a classifier cluster id to its display persona.
///
/// Total over all inputs: ids outside the known set, or an absent id, return
/// the default persona.
#[must_use]
pub fn resolve_persona(cluster_id: Option<ClusterId>) -> Persona {
    match cluster_id.map(|id| id.value()) {
        Some(0) => ANALYTICAL_THINKER,
        Some(1) => CAREFUL_REFINER,
        Some(2) => HESITANT_EXPLORER,
        Some(3) => PROFICIENT_LEARNER,
        Some(4) => FAST_IMPROVISER,
        _ => DEFAULT_PERSONA,
    }
}
