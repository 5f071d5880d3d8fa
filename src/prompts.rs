use anyhow::{anyhow, Result};
use clap::ValueEnum;
use dialoguer::{Confirm, Input, Select};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CodingAgent {
    Claude,
    Codex,
    Opencode,
}

impl CodingAgent {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "claude" => Some(CodingAgent::Claude),
            "codex" => Some(CodingAgent::Codex),
            "opencode" => Some(CodingAgent::Opencode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CodingAgent::Claude => "claude",
            CodingAgent::Codex => "codex",
            CodingAgent::Opencode => "opencode",
        }
    }
}

pub fn prompt_commit_message() -> Result<String> {
    let message = Input::<String>::new()
        .with_prompt("Commit message")
        .interact_text()?;
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("commit message is required"));
    }
    Ok(trimmed.to_string())
}

pub fn prompt_description() -> Result<String> {
    let description = Input::<String>::new()
        .with_prompt("What is this worktree for?")
        .interact_text()?;
    Ok(description.trim().to_string())
}

pub fn prompt_coding_agent(default: CodingAgent) -> Result<CodingAgent> {
    let options = [CodingAgent::Claude, CodingAgent::Codex, CodingAgent::Opencode];
    let labels = ["Claude Code", "Codex", "Opencode"];
    let default_index = options.iter().position(|agent| *agent == default).unwrap_or(0);
    let selection = Select::new()
        .with_prompt("Select coding agent")
        .items(&labels)
        .default(default_index)
        .interact()?;
    options
        .get(selection)
        .copied()
        .ok_or_else(|| anyhow!("agent selection required"))
}

pub fn confirm(message: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?)
}
