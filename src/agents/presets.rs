//! Built-in agent definitions
//!
//! `smart_buddy` is the pocket-money assistant: it logs expenses and income
//! against a companion backend, reports balances and savings goals, and hands
//! out saving tips. Its prompts reference the backend via `{{ backend_url }}`.

use std::collections::BTreeMap;

use super::domain::{AgentConfigurationRequest, AgentRequestBuilder, EmailInclude, TranscriberConfig};
use super::template;

pub const SMART_BUDDY_NAME: &str = "SmartBuddy";
pub const BACKEND_URL_VAR: &str = "backend_url";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5003";

// Prompt bodies are sent verbatim, surrounding spaces included
const INTRODUCTION: &str = " Start with a friendly greeting, reminding them you're here to help manage their pocket money. Detect the user's intent based on their input, identifying if they're adding expenses, checking balances, or seeking tips. Example prompt: 'Hey there, I’m SmartBuddy! How can I help you with your pocket money today?' When they respond, listen carefully to categorize their intention, like 'adding an expense' or 'checking balance'. ";
const EXPENSE_TRACKING: &str = " Upon recognizing an expense or income addition, confirm the details with the user. For example: 'You spent ₹100 on snacks. I'll add that now. Sound good?' or 'Adding ₹500 to your pocket money, right?' Once confirmed, send the transaction data to the backend API ({{ backend_url }}/add-transaction). Wait for a successful response before confirming back to the user: 'Got it! Your transaction has been updated.' ";
const BALANCE_INQUIRY: &str = " If the user asks about their balance or how close they are to their savings goal, fetch the relevant details from the API ({{ backend_url }}/get-summary). Communicate these details enthusiastically: 'Your balance is ₹750, great job!' or 'Awesome! You're just ₹200 away from reaching your savings goal!' ";
const SAVING_TIPS: &str = " When asked for tips, retrieve a helpful money-saving tip from the backend. Share this in an engaging manner: 'Here's a tip just for you: Make a list before shopping to avoid impulse buys!' Keep these interactions light and motivational to encourage better habits. ";
const MANUAL_FALLBACK: &str = " If the microphone access is denied, gently encourage manual input: 'No worries! You can type your expenses or questions in too.' Make sure they feel comfortable using the app in the method they prefer. ";

/// Unrendered SmartBuddy definition
pub fn smart_buddy() -> AgentConfigurationRequest {
    AgentRequestBuilder::new(SMART_BUDDY_NAME)
        .welcome_message(
            "Hey there! I'm SmartBuddy, your pocket money pal. How can I help manage your money today?",
        )
        .context("Introduction and Intent Detection", INTRODUCTION)
        .context("Expense Tracking & Income Addition", EXPENSE_TRACKING)
        .context("Balance Inquiry and Goal Updates", BALANCE_INQUIRY)
        .context("Money-Saving Tips", SAVING_TIPS)
        .context("Fallback to Manual Input", MANUAL_FALLBACK)
        .transcriber(TranscriberConfig {
            provider: "deepgram_stream".to_string(),
            silence_timeout_ms: 400,
            model: Some("nova-3".to_string()),
            numerals: true,
            punctuate: true,
            smart_format: false,
            diarize: false,
        })
        .model("gpt-4o-mini", 0.7)
        .voice("eleven_labs", "cgSgspJ2msm6clMCkdW9")
        .email_recipient("example@example.com")
        .email_include(EmailInclude::Summary)
        .email_include(EmailInclude::ExtractedVariables)
        .extract(
            "amount",
            "Extract or Generate the amount of money involved in the transaction from the input.",
        )
        .extract(
            "category",
            "Extract the category of the transaction, like 'snacks' or 'pocket money', from the input.",
        )
        .extract(
            "transaction_type",
            "Identify whether the transaction is an 'expense' or 'income'.",
        )
        .build_unchecked()
        .expect("SmartBuddy preset sets every required section")
}

/// SmartBuddy rendered against the default backend URL
pub fn smart_buddy_rendered() -> AgentConfigurationRequest {
    let mut variables = BTreeMap::new();
    variables.insert(BACKEND_URL_VAR.to_string(), DEFAULT_BACKEND_URL.to_string());
    template::render_request(&smart_buddy(), &variables)
        .expect("SmartBuddy preset only references backend_url")
}
