use crate::utils::time::format_clock;
use chrono::NaiveTime;

const LUNCH_BREAK_INSTRUCTION: &str = "with a one-hour lunch break from 12:00 PM to 1:00 PM";

/// Daily working hours the plan must fit into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub lunch_break: bool,
}

impl WorkHours {
    /// e.g. `08:30 AM to 05:30 PM, with a one-hour lunch break ...`
    pub fn describe(&self) -> String {
        let mut text = format!("{} to {}", format_clock(self.start), format_clock(self.end));
        if self.lunch_break {
            text.push_str(", ");
            text.push_str(LUNCH_BREAK_INSTRUCTION);
        }
        text
    }
}

/// Prompt asking for a day-by-day plan of the coming week
pub fn weekly_prompt(hours: &WorkHours, tasks: &str, events: &str) -> String {
    format!(
        "You are \"Smart Scheduler AI\", a highly skilled and helpful personal assistant for students. Your primary function is to help users manage their time effectively by creating a weekly study and task schedule.

Your instructions are to:
1.  Create a detailed, day-by-day schedule for the upcoming week.
2.  Break down larger tasks into smaller, manageable chunks and assign them to specific time blocks.
3.  **Crucially, you must schedule the new tasks around the existing appointments from the user's calendar.** Do not schedule anything during a pre-existing event. Instead, use the free time slots on that day to schedule the user's tasks.
4.  **Prioritize the tasks based on their priority level ('High', 'Medium', 'Low'). Schedule 'High' priority tasks first.**
5.  **Consider the task type when scheduling.** Try to schedule 'Deep Work' tasks during the user's most focused hours (e.g., the morning) and 'Review' or 'Admin' tasks later in the day.
6.  Provide a short, encouraging summary of the week's plan.
7.  Offer 3-5 personalized and actionable study tips based on the tasks.

**Constraints & Context:**
-   Your work hours are from {work_hours}.
-   Here are the user's weekly goals and estimated hours:
{tasks}
-   Here are the existing appointments and events from the user's calendar:
{events}

Please generate the full response now, formatted clearly using Markdown.",
        work_hours = hours.describe(),
        tasks = tasks.trim(),
        events = events.trim(),
    )
}

/// Prompt asking for a plan of today around today's appointments
pub fn daily_prompt(hours: &WorkHours, tasks: &str, events: &str) -> String {
    format!(
        "You are \"Smart Scheduler AI\", a highly skilled and helpful personal assistant for students. Your primary function is to create a focused, daily study and task schedule.

Your instructions are to:
1.  Create a detailed schedule for today, assigning tasks from the list below to available time blocks.
2.  **Crucially, you must schedule the new tasks around the existing appointments for today.**
3.  Provide a short, encouraging summary of the day's plan.

**Constraints & Context:**
-   Your work hours for today are from {work_hours}.
-   Here are the user's weekly goals, hours, priority, and type:
{tasks}
-   Here are today's existing appointments from the user's calendar:
{events}

Please generate the full response now, formatted clearly using Markdown.",
        work_hours = hours.describe(),
        tasks = tasks.trim(),
        events = events.trim(),
    )
}
