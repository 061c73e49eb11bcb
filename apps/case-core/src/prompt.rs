/// Business guidance handed to the assistant with every turn.
pub const INSTRUCTIONS: &str = "\
You are helping the user in a case management application.

When referring to or summarizing a case, make sure to use plain text not markdown.

Gold Tier and above are eligible for a complimentary shipping transfer and upgrade.

In case of a problem, we can offer the following discounts:
  - 10% for Basic Tier
  - 15% for Silver Tier
  - 20% for Gold Tier
  - 25% for Platinum Tier
";

pub fn system_prompt(instructions: &str, context: &str) -> String {
    let mut s = String::new();
    s.push_str(instructions.trim_end());
    s.push_str("\n\nCurrent context:\n");
    s.push_str(context);
    s.push('\n');
    s.push_str("\nTool usage policy:\n");
    s.push_str("- Use the provided operations to change the case or draft emails; do not describe edits you did not make.\n");
    s.push_str("- Owner and account must be given as ids from the listed users and accounts.\n");
    s
}
