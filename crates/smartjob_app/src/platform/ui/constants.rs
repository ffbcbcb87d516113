pub const TAG_SESSION: &str = "[session]";
pub const TAG_LOGIN: &str = "[login]";
pub const TAG_UPLOAD: &str = "[upload]";
pub const TAG_RECOMMENDATIONS: &str = "[recommendations]";
pub const TAG_SKILLS: &str = "[skills]";
pub const TAG_FEEDBACK: &str = "[feedback]";

pub const JOB_COLUMNS: [&str; 4] = ["Title", "Company", "Location", "Description"];
pub const MAX_CELL_WIDTH: usize = 48;
pub const BAR_WIDTH: usize = 40;
