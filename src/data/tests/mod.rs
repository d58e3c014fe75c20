mod mnist;
