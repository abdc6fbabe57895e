mod user_patch;
