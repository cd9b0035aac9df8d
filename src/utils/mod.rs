//! 测试共用的工具宏
