use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{OutcomeKind, TutorIntent, TutorModal, TutorVm};

/// Cosmetic pause before the next question renders, so the closing overlay
/// can animate. The state update itself never depends on it.
const SETTLE_MS: u64 = 150;

/// DOM-style label for a key event, matching the telemetry wire vocabulary
/// ("a", "Shift", "Backspace", ...).
fn key_label(key: &Key) -> String {
    match key {
        Key::Character(value) => value.to_string(),
        other => other.to_string(),
    }
}

/// The tutoring screen: schema reference, question card, answer entry with
/// telemetry capture, and the outcome overlays.
#[component]
pub fn TutorView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let session = ctx.session();
    let vm = use_signal(move || session.take().map(TutorVm::new));
    // Set once on entry; an empty slot is a precondition failure and routes
    // back to the name screen.
    let has_session = use_hook(|| vm.peek().is_some());

    use_effect(move || {
        if !has_session {
            navigator.push(Route::EnterName {});
        }
    });

    let session_for_exit = ctx.session();
    let dispatch = use_callback(move |intent: TutorIntent| {
        let mut vm = vm;

        match intent {
            TutorIntent::Retry => {
                if let Some(value) = vm.write().as_mut() {
                    value.retry();
                }
            }
            TutorIntent::RequestQuit => {
                if let Some(value) = vm.write().as_mut() {
                    value.request_quit();
                }
            }
            TutorIntent::CancelQuit => {
                if let Some(value) = vm.write().as_mut() {
                    value.cancel_quit();
                }
            }
            TutorIntent::Submit => {
                spawn(async move {
                    let taken = vm.write().take();
                    let Some(mut value) = taken else { return };
                    value.submit().await;
                    // Always put the flow back so the screen stays usable
                    // even after errors.
                    vm.set(Some(value));
                });
            }
            TutorIntent::ConfirmQuit => {
                spawn(async move {
                    let taken = vm.write().take();
                    let Some(mut value) = taken else { return };
                    value.confirm_quit().await;
                    vm.set(Some(value));
                });
            }
            TutorIntent::Advance => {
                spawn(async move {
                    tokio::time::sleep(Duration::from_millis(SETTLE_MS)).await;
                    if let Some(value) = vm.write().as_mut() {
                        value.advance();
                    }
                });
            }
            TutorIntent::Exit => {
                let session = session_for_exit.clone();
                spawn(async move {
                    let taken = vm.write().take();
                    if let Some(mut value) = taken {
                        value.exit().await;
                    }
                    session.clear();
                    navigator.push(Route::EnterName {});
                });
            }
        }
    });

    let vm_guard = vm.read();

    if !has_session {
        return rsx! {
            div { class: "tutor-bg",
                p { "No active session. Returning to the start screen..." }
            }
        };
    }

    let Some(view) = vm_guard.as_ref() else {
        // The flow is briefly out of the slot while a round trip runs.
        return rsx! {
            div { class: "tutor-bg",
                div { class: "modal-overlay",
                    div { class: "modal-content", p { "Submitting..." } }
                }
            }
        };
    };

    let question = view
        .question()
        .map(|q| (q.title().to_string(), q.description().to_string()));
    let question_number = view.question_number();
    let total_questions = view.total_questions();
    let attempts = view.attempts();
    let max_attempts = view.max_attempts();
    let query = view.query().to_string();
    let locked = !view.is_editable();
    let can_submit = view.can_submit();
    let modal = view.modal();
    let outcome = view.outcome();
    let persona = view.persona();
    let revealed_solution = view.revealed_solution().map(str::to_string);
    let feedback = view.feedback().map(|verdict| {
        (
            verdict.error_type().to_string(),
            verdict.error_subtype().to_string(),
            verdict.feedback().to_string(),
        )
    });

    rsx! {
        div { class: "tutor-bg",
            h1 { class: "tutor-title", "Adaptive SQL Learning Feedback System" }

            div { class: "tutor-container",
                div { class: "top-row",
                    div { class: "sidebar-schema", SchemaPanel {} }

                    div { class: "main-content-area",
                        div { class: "question-query-row",
                            div { class: "card question-wrapper",
                                if let Some((title, description)) = question {
                                    QuestionPanel {
                                        number: question_number,
                                        total: total_questions,
                                        title,
                                        description,
                                        attempts,
                                        max_attempts,
                                    }
                                } else {
                                    div { class: "question-empty", "No more questions." }
                                }
                            }

                            div { class: "card query-card",
                                h2 { class: "section-title", "Enter Your SQL Query" }
                                textarea {
                                    class: "sql-input",
                                    id: "sql-answer",
                                    placeholder: "e.g., SELECT * FROM Employees;",
                                    value: "{query}",
                                    disabled: locked,
                                    oninput: move |evt| {
                                        let mut vm = vm;
                                        if let Some(value) = vm.write().as_mut() {
                                            value.set_query(evt.value());
                                        }
                                    },
                                    onkeydown: move |evt| {
                                        let mut vm = vm;
                                        if let Some(value) = vm.write().as_mut() {
                                            value.key_down(&key_label(&evt.data.key()));
                                        }
                                    },
                                    onkeyup: move |evt| {
                                        let mut vm = vm;
                                        if let Some(value) = vm.write().as_mut() {
                                            value.key_up(&key_label(&evt.data.key()));
                                        }
                                    },
                                }

                                div { class: "button-row",
                                    button {
                                        class: "btn-submit",
                                        disabled: !can_submit,
                                        onclick: move |_| dispatch.call(TutorIntent::Submit),
                                        "Submit"
                                    }
                                    button {
                                        class: "btn-retry",
                                        onclick: move |_| dispatch.call(TutorIntent::Retry),
                                        "Retry"
                                    }
                                    button {
                                        class: "btn-quit",
                                        onclick: move |_| dispatch.call(TutorIntent::RequestQuit),
                                        "Quit"
                                    }
                                }
                                p { class: "query-hint",
                                    "Once you submit your query, the editor is locked to prevent "
                                    "accidental changes. Click "
                                    strong { "Retry" }
                                    " to make another attempt."
                                }
                            }
                        }

                        if modal == TutorModal::None {
                            if let Some((error_type, error_subtype, text)) = feedback {
                                FeedbackCard { error_type, error_subtype, text }
                            }
                        }
                    }
                }
            }

            if modal == TutorModal::ConfirmQuit {
                div { class: "modal-overlay",
                    div { class: "modal-content",
                        h3 { class: "modal-title", "End This Question" }
                        p { class: "modal-message",
                            "Quit will end this question now and we'll show your learner type "
                            "based on your current typing data. Continue?"
                        }
                        div { class: "modal-actions",
                            button {
                                class: "btn-quit",
                                onclick: move |_| dispatch.call(TutorIntent::ConfirmQuit),
                                "Quit & View Learner Type"
                            }
                            button {
                                class: "btn-cancel",
                                onclick: move |_| dispatch.call(TutorIntent::CancelQuit),
                                "Cancel"
                            }
                        }
                    }
                }
            }

            if modal == TutorModal::Outcome {
                if let Some(kind) = outcome {
                    OutcomeOverlay {
                        kind,
                        persona_title: persona.title,
                        persona_description: persona.description,
                        persona_encouragement: persona.encouragement,
                        solution: revealed_solution,
                        on_continue: move |()| dispatch.call(TutorIntent::Advance),
                    }
                }
            }

            if modal == TutorModal::AllDone {
                div { class: "modal-overlay",
                    div { class: "modal-content",
                        h3 { class: "modal-title", "🎉 All Questions Completed!" }
                        p { "You've finished all questions. Great work!" }
                        div { class: "modal-actions",
                            button {
                                class: "btn-submit",
                                onclick: move |_| dispatch.call(TutorIntent::Exit),
                                "Exit"
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Static reference for the practice database.
#[component]
fn SchemaPanel() -> Element {
    rsx! {
        div { class: "schema-card",
            h2 { class: "schema-title", "Database Schema" }

            SchemaBlock {
                name: "Employees",
                columns: "Employee_ID(INT) PK\nName(TEXT)\nJob_Role(TEXT)\nDivision(TEXT)\nLast_Login_Time(DATE)",
            }
            SchemaBlock {
                name: "Robots",
                columns: "Robot_ID(INT) PK\nEmployee_ID(INT) FK\nModel(TEXT)\nManufacturing_Date(DATE)\nStatus(TEXT)\nLast_Software_Update(DATE)",
            }
            SchemaBlock {
                name: "Logs",
                columns: "Log_ID(INT) PK\nEmployee_ID(INT) FK\nRobot_ID(INT) FK\nAction_Description(TEXT)\nTimestamp(DATE)",
            }
            SchemaBlock {
                name: "Incidents",
                columns: "Incident_ID(INT) PK\nEmployee_ID(INT) FK\nRobot_ID(INT) FK\nDescription(TEXT)\nTimestamp(DATE)",
            }
            SchemaBlock {
                name: "Access_Codes",
                columns: "Access_Code_ID(INT) PK\nEmployee_ID(INT) FK\nLevel_of_Access(TEXT)\nTimestamp_of_Last_Use(DATE)",
            }
        }
    }
}

#[component]
fn SchemaBlock(name: &'static str, columns: &'static str) -> Element {
    rsx! {
        div { class: "schema-block",
            h3 { class: "schema-section", "{name}" }
            pre { class: "schema-list", "{columns}" }
        }
    }
}

#[component]
fn QuestionPanel(
    number: usize,
    total: usize,
    title: String,
    description: String,
    attempts: u32,
    max_attempts: u32,
) -> Element {
    rsx! {
        div { class: "question-card",
            div { class: "rules-section",
                h3 { class: "rules-title", "Practice Rules" }
                p { class: "rules-text",
                    "You have "
                    strong { "{max_attempts} attempts" }
                    " for each question. Every "
                    strong { "Submit" }
                    " counts as an attempt, whether right or wrong. You can "
                    strong { "Quit" }
                    " anytime to end this question. After solving, using all attempts, "
                    "or quitting, your "
                    strong { "learner type" }
                    " will be shown."
                }
            }

            div { class: "question-content",
                h2 { class: "question-title", "Question {number} of {total}: {title}" }
                p { class: "question-description", "{description}" }
            }

            div { class: "attempts-info", "Attempts: {attempts} / {max_attempts}" }
        }
    }
}

#[component]
fn FeedbackCard(error_type: String, error_subtype: String, text: String) -> Element {
    rsx! {
        div { class: "feedback-card",
            h2 { class: "combined-title", "Results" }
            p { class: "field",
                strong { "Error Type: " }
                "{error_type}"
            }
            p { class: "field",
                strong { "Error Subtype: " }
                "{error_subtype}"
            }
            div { class: "divider" }
            h2 { class: "combined-title", "Feedback" }
            p { class: "feedback-text", "{text}" }
        }
    }
}

#[component]
fn OutcomeOverlay(
    kind: OutcomeKind,
    persona_title: &'static str,
    persona_description: &'static str,
    persona_encouragement: &'static str,
    solution: Option<String>,
    on_continue: EventHandler<()>,
) -> Element {
    let (title, title_class, action_label) = match kind {
        OutcomeKind::Solved => ("🎉 Correct!", "modal-title modal-title--success", "Continue"),
        OutcomeKind::OutOfAttempts => {
            ("Out of Attempts", "modal-title modal-title--pity", "Next Question")
        }
        OutcomeKind::Quit => ("Keep Going!", "modal-title", "Next Question"),
    };

    rsx! {
        div { class: "modal-overlay",
            div { class: "modal-content",
                h3 { class: "{title_class}", "{title}" }

                if kind == OutcomeKind::OutOfAttempts {
                    if let Some(solution) = solution {
                        p {
                            strong { "The correct answer is:" }
                        }
                        pre { class: "correct-answer-box", "{solution}" }
                    }
                }

                if kind == OutcomeKind::Quit {
                    p { class: "modal-message",
                        "This question is now complete. Here's your learner insight:"
                    }
                }

                p { class: "modal-cluster",
                    "Your learner type for this question:"
                    br {}
                    strong { "{persona_title}" }
                }
                p { class: "modal-message", "{persona_description}" }
                p { class: "modal-encouragement", "{persona_encouragement}" }

                div { class: "modal-actions",
                    button {
                        class: "btn-submit",
                        onclick: move |_| on_continue.call(()),
                        "{action_label}"
                    }
                }
            }
        }
    }
}
