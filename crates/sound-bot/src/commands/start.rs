//! Start command - welcome message.

pub const WELCOME: &str = "Welcome to Sound Bot!\n\
Troll your friends with funny sounds!\n\
Send /help to see everything I can play.";
